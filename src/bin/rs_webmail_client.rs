use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use rs_webmail_client::api::MailApi;
use rs_webmail_client::api::http::HttpMailApi;
use rs_webmail_client::config::{Config, load_config, load_config_from, resolve_log_path};
use rs_webmail_client::domain::email::{EmailId, EmailPatch, Mailbox, OutgoingEmail};
use rs_webmail_client::terminal::run_tui;

#[derive(Parser)]
#[command(name = "rs_webmail_client")]
#[command(about = "Terminal client for a REST webmail server", long_about = None)]
struct Cli {
    /// Config file to use instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive client (default)
    Tui {
        /// Mailbox shown on start
        #[arg(long, default_value = "inbox")]
        mailbox: Mailbox,
    },

    /// Print a mailbox listing
    List { mailbox: Mailbox },

    /// Print one email
    Show { id: EmailId },

    /// Send an email
    Send {
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        body: String,
    },

    /// Archive an email (or unarchive it with --undo)
    Archive {
        id: EmailId,
        #[arg(long)]
        undo: bool,
    },
}

fn init_logging(file: Option<File>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(file) = file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn open_log(cfg: &Config) -> Result<File> {
    let path = resolve_log_path(cfg)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| anyhow!("cannot open log file {}: {e}", path.display()))
}

/// Stderr logging plus a client, for the non-interactive commands.
fn one_shot(cfg: &Config) -> Result<HttpMailApi> {
    init_logging(None);
    cfg.http_api()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .map_err(|e| anyhow!("Configuration error: {e}"))?;

    let cmd = cli.cmd.unwrap_or(Command::Tui {
        mailbox: Mailbox::Inbox,
    });

    match cmd {
        Command::Tui { mailbox } => {
            // stderr belongs to the terminal UI
            init_logging(Some(open_log(&cfg)?));
            color_eyre::install().map_err(|e| anyhow!("{e}"))?;
            run_tui(Box::new(cfg.http_api()?), mailbox)
        }

        Command::List { mailbox } => {
            let api = one_shot(&cfg)?;
            let emails = api.list_mailbox(mailbox)?;
            println!("{}", mailbox.title());
            for e in emails {
                let read = e.read || mailbox.always_read();
                println!(
                    "{} {:>6}  {} | {} | {}",
                    if read { " " } else { "*" },
                    e.id,
                    e.recipients,
                    e.subject,
                    e.timestamp
                );
            }
            Ok(())
        }

        Command::Show { id } => {
            let api = one_shot(&cfg)?;
            let e = api.get_email(id)?;
            println!("From: {}", e.sender);
            println!("To: {}", e.recipients);
            println!("Subject: {}", e.subject);
            println!("Timestamp: {}", e.timestamp);
            println!();
            println!("{}", e.body);
            Ok(())
        }

        Command::Send { to, subject, body } => {
            let api = one_shot(&cfg)?;
            api.send_email(&OutgoingEmail {
                recipients: to,
                subject,
                body,
            })?;
            println!("Email sent successfully");
            Ok(())
        }

        Command::Archive { id, undo } => {
            let api = one_shot(&cfg)?;
            api.update_email(id, EmailPatch::set_archived(!undo))?;
            println!("Email {id} {}", if undo { "unarchived" } else { "archived" });
            Ok(())
        }
    }
}
