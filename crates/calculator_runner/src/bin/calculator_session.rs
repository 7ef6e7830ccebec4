use anyhow::{Context, Result};
use base::requests::ureq::UreqRequestApi;
use base::settings::ApiSettings;
use calculator::worker::{ApiEvent, RemoteWorker};
use calculator::Calculator;
use calculator_runner::session::{self, Command, Reaction, HELP};
use crossbeam::channel::{select, unbounded, Receiver};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use order_api::WbOrderApi;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const LOG_FILE: &str = "calculator.log";

fn init_logging() -> Result<()> {
    let level = match dotenv::var(LOG_LEVEL_ENV) {
        Ok(level) => LevelFilter::from_str(&level)
            .ok()
            .with_context(|| format!("invalid {}: {}", LOG_LEVEL_ENV, level))?,
        Err(_) => LevelFilter::Info,
    };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
        .build(LOG_FILE)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(level),
        )?;

    log4rs::init_config(config)?;

    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = unbounded();

    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::error!("failed to read the input: {:?}", err);
                    break;
                }
            }
        }
    });

    receiver
}

fn main() -> Result<()> {
    let settings = ApiSettings::from_env()?;
    init_logging()?;

    log::info!("calculator session against {}", settings.base_url);

    let api = Arc::new(WbOrderApi::new(
        &settings,
        UreqRequestApi::with_timeout(settings.request_timeout),
    ));
    let (worker, api_events) = RemoteWorker::new(Arc::clone(&api));

    let mut calculator = Calculator::new(settings.telegram_user_id);
    calculator.load_reference_data(api.as_ref());

    println!("{}", HELP);
    println!("{}", session::render(&calculator));

    let lines = spawn_stdin_reader();

    loop {
        select! {
            recv(lines) -> line => {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match Command::from_str(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                };

                match session::apply(&mut calculator, command) {
                    Reaction::Render => println!("{}", session::render(&calculator)),
                    Reaction::Quote(request) => {
                        worker.dispatch_quote(request);
                        println!("{}", session::render(&calculator));
                    }
                    Reaction::Order(request) => {
                        worker.dispatch_order(request);
                        println!("{}", session::render(&calculator));
                    }
                    Reaction::Print(text) => println!("{}", text),
                    Reaction::Quit => break,
                }
            }
            recv(api_events) -> event => {
                match event {
                    Ok(ApiEvent::Quote(response)) => {
                        calculator.apply_quote(response);
                    }
                    Ok(ApiEvent::Order(result)) => calculator.finish_submit(result),
                    Err(_) => break,
                }
                println!("{}", session::render(&calculator));
            }
        }
    }

    Ok(())
}
