// UI layer: the line-oriented menu loop. Commands are read one line at a
// time from any `BufRead`, and everything is written to any `Write`, so
// the loop runs the same against a terminal or a scripted buffer.

use crate::api::{Action, ActionResult, ApiClient, DEFAULT_FLOAT_COINS};
use crate::error::{HarnessError, Result};
use crate::format;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;

const SEPARATOR: &str = "--------------------------------------------------------";

const MENU: &str = "Vending Test Harness
--------------------
I - Initialise a Vending machine
--------------------------------
D - Deposit coins before vending
V - Vend
R - Refund
--------------------------------
P - Show products
C - Show Coin bucket
F - Show Float / Deposit values
E - Exit";

/// A menu entry, keyed by the first character of the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Initialize,
    Deposit,
    Vend,
    Refund,
    Products,
    CoinBucket,
    Float,
    Exit,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'I' => Some(Command::Initialize),
            'D' => Some(Command::Deposit),
            'V' => Some(Command::Vend),
            'R' => Some(Command::Refund),
            'P' => Some(Command::Products),
            'C' => Some(Command::CoinBucket),
            'F' => Some(Command::Float),
            'E' => Some(Command::Exit),
            _ => None,
        }
    }

    /// Only the first character counts; the rest of the line is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        line.chars().next().and_then(Self::from_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive session over an API client and a pair of streams.
pub struct Menu<R, W> {
    api: ApiClient,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(api: ApiClient, input: R, output: W) -> Self {
        Menu { api, input, output }
    }

    /// Hand back the output stream, mostly so tests can inspect it.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Loop until `E` is entered or the input runs out. Failures of a
    /// single action are reported and the loop carries on; only I/O errors
    /// on the streams end it early.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", SEPARATOR)?;
            writeln!(self.output)?;
            let status = self.show_status()?;
            writeln!(self.output, "GetStatus response: {}", status)?;
            writeln!(self.output)?;
            writeln!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                log::debug!("input closed, leaving menu");
                return Ok(());
            };

            let Some(command) = Command::parse(&line) else {
                writeln!(self.output, "Invalid option ")?;
                continue;
            };

            match self.dispatch(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(HarnessError::Parse(e)) => {
                    writeln!(self.output, "Unable to format product list: {}", e)?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        log::debug!("dispatching {:?}", command);
        match command {
            Command::Initialize => self.initialize(),
            Command::Deposit => {
                writeln!(self.output, "Deposit")?;
                let Some(coins) = self.prompt("Please enter coins :")? else {
                    return Ok(Flow::Exit);
                };
                self.plain(Action::Deposit(coins))?;
                Ok(Flow::Continue)
            }
            Command::Vend => {
                writeln!(self.output, "Vend")?;
                let Some(product) = self.prompt("Please enter product :")? else {
                    return Ok(Flow::Exit);
                };
                self.plain(Action::Vend(product))?;
                Ok(Flow::Continue)
            }
            Command::Refund => {
                writeln!(self.output, "Refund")?;
                self.plain(Action::Refund)?;
                Ok(Flow::Continue)
            }
            Command::Float => {
                writeln!(self.output, "GetFloat / Deposit")?;
                self.plain(Action::FloatValue)?;
                Ok(Flow::Continue)
            }
            Command::CoinBucket => {
                writeln!(self.output, "GetCoinBucket")?;
                self.plain(Action::CoinBucket)?;
                Ok(Flow::Continue)
            }
            Command::Products => {
                self.show_products()?;
                Ok(Flow::Continue)
            }
            Command::Exit => {
                writeln!(self.output, "Exiting")?;
                Ok(Flow::Exit)
            }
        }
    }

    /// Status call as shown before every prompt. Returns the status text.
    fn show_status(&mut self) -> Result<String> {
        writeln!(self.output, "GetStatus")?;
        let result = self.call(&Action::Status);
        self.report(&Action::Status, &result)?;
        if result.is_ok() {
            writeln!(self.output, "result : {}", result.body())?;
        }
        Ok(result.into_status_text())
    }

    fn initialize(&mut self) -> Result<Flow> {
        writeln!(self.output, "Initialising Vending Machine")?;

        let status = self.show_status()?;
        let current = format::machine_status(&status).unwrap_or(status);
        writeln!(self.output, "Status: {}", current)?;
        if current != "INACTIVE" {
            writeln!(
                self.output,
                "Vending machine is already initialised, continuing will produce error response from API"
            )?;
        }

        writeln!(self.output, "Default is : {}", DEFAULT_FLOAT_COINS)?;
        let Some(coins) = self.prompt("Please enter float coins :")? else {
            return Ok(Flow::Exit);
        };
        self.plain(Action::initialize(&coins))?;
        Ok(Flow::Continue)
    }

    fn show_products(&mut self) -> Result<()> {
        writeln!(self.output, "Show products")?;
        let action = Action::Products;
        let result = self.call(&action);
        if !self.report(&action, &result)? {
            return Ok(());
        }
        writeln!(self.output, "result : {}", result.body())?;
        if result.is_ok() {
            let table = format::format_products(result.body())?;
            writeln!(self.output)?;
            writeln!(self.output, "{}", table)?;
        }
        Ok(())
    }

    /// Call an action whose body is shown verbatim.
    fn plain(&mut self, action: Action) -> Result<()> {
        let result = self.call(&action);
        if self.report(&action, &result)? {
            writeln!(self.output, "result : {}", result.body())?;
        }
        Ok(())
    }

    /// Print the transport/status summary. Returns false when the service
    /// could not be reached at all.
    fn report(&mut self, action: &Action, result: &ActionResult) -> io::Result<bool> {
        let Some(status_line) = result.status_line() else {
            writeln!(self.output, "Unable to invoke {} endpoint", action.endpoint())?;
            return Ok(false);
        };
        writeln!(self.output, "response status line :: {}", status_line)?;
        match result.status_code() {
            Some(200) => writeln!(self.output, "Status Code  : 200")?,
            Some(code) => writeln!(self.output, "StatusCode not 200  : {}", code)?,
            None => {}
        }
        Ok(true)
    }

    fn call(&mut self, action: &Action) -> ActionResult {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Calling {}...", action.endpoint()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = self.api.execute(action);
        spinner.finish_and_clear();
        result
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Next line without its line ending, echoed back. `None` on EOF.
    /// Bytes that are not UTF-8 are replaced rather than failing the read.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        writeln!(self.output, "You entered :{}", line)?;
        Ok(Some(line))
    }
}

/// Run the menu on the process's stdin and stdout. Blocks until exit.
pub fn main_menu(api: ApiClient) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(api, stdin.lock(), stdout.lock()).run()
}
