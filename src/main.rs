use std::process::ExitCode;

use clap::Parser;
use log::error;

use catpig::actions::{cancel, test_page};
use catpig::cli::Cli;
use catpig::config::loading::load_config;
use catpig::config::models::Settings;
use catpig::cups_client::{CupsClient, PrintService};
use catpig::error::{Error, Result};
use catpig::resolver::{self, Selection};
use catpig::status::{self, report, StatusBoard};

fn main() -> ExitCode {
    colog::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let settings = load_config(cli.config.as_deref())?;
    let service = CupsClient::new(&settings.cups).map_err(|err| Error::Config {
        what: format!("{err:#}"),
    })?;

    // One trip to the service for the directory and the job queue, shared by
    // every later stage.
    let printers = service.printers().map_err(Error::service)?;
    let live_names: Vec<String> = printers.iter().map(|p| p.name.clone()).collect();
    let board = StatusBoard::collect(printers, &service)?;

    let match_mode = cli.match_mode.unwrap_or(settings.behavior.match_mode);
    let mut selection = match resolver::resolve(
        &live_names,
        cli.cups,
        &settings.lists.dir,
        &cli.printer,
        match_mode,
    ) {
        Ok(selection) => selection,
        Err(Error::EmptySelection { filters, checked }) => {
            println!("No printers found matching {filters}.");
            if let Some(files) = checked {
                println!("Checked {files}");
            }
            return Ok(if settings.behavior.empty_selection_fatal {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
        Err(other) => return Err(other),
    };

    if cli.alerts || cli.jobs {
        status::apply_view_filter(&mut selection, &board, cli.alerts, cli.jobs);
    }

    if cli.json {
        report::print_json(&board, &selection)?;
        return Ok(ExitCode::SUCCESS);
    }

    let missing = display_and_act(cli, &settings, &service, &board, &selection);

    if missing && settings.behavior.not_found_exit_code != 0 {
        return Ok(ExitCode::from(settings.behavior.not_found_exit_code));
    }
    Ok(ExitCode::SUCCESS)
}

/// Walk the selection in order: print the requested view for each printer,
/// then run the requested actions against it. A failing action is reported
/// and the batch moves on to the next entry.
fn display_and_act(
    cli: &Cli,
    settings: &Settings,
    service: &dyn PrintService,
    board: &StatusBoard,
    selection: &Selection,
) -> bool {
    let mut missing = false;

    for group in &selection.groups {
        if group.names.is_empty() {
            continue;
        }
        if selection.grouped && !cli.details {
            println!("{}", group.label.to_uppercase());
        }

        for name in &group.names {
            if cli.details {
                report::print_details(board, name);
            } else {
                report::print_summary_line(board, name, cli.alerts, cli.jobs);
            }

            let known = board.printer(name).is_some();
            missing |= !known;

            if cli.test {
                if !known {
                    error!("test page: {}", Error::NotFound { name: name.clone() });
                } else if let Err(err) = test_page::run(service, &settings.test_page, name) {
                    error!("test page for {name}: {err:#}");
                }
            }

            if cli.kill {
                if !known {
                    error!("cancel: {}", Error::NotFound { name: name.clone() });
                } else {
                    for job in board.jobs(name) {
                        if let Err(err) = cancel::run(service, &settings.mail, job) {
                            error!("cancelling job {} on {name}: {err}", job.id);
                        }
                    }
                }
            }
        }

        if selection.grouped && !cli.details {
            println!();
        }
    }

    missing
}
