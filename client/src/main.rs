use env_logger::Env;
use invitely_client::config::ClientConfig;
use invitely_client::session::{ExportTarget, Session};
use invitely_client::toast::ToastKind;
use invitely_shared::models::{Invitation, Rsvp};
use log::{debug, error};
use std::process::ExitCode;

mod cli;

use clap::Parser as _;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let command = Cli::parse().command;

    let config = ClientConfig::from_env();
    debug!("Using service at {}", config.api_base_url);

    let mut session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid client configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let succeeded = run(&mut session, command).await;

    for toast in session.toasts.drain() {
        let marker = match toast.kind {
            ToastKind::Error => "error",
            ToastKind::Success => "ok",
            ToastKind::Info | ToastKind::Default => "info",
        };
        match toast.description {
            Some(description) => eprintln!("[{}] {}: {}", marker, toast.title, description),
            None => eprintln!("[{}] {}", marker, toast.title),
        }
    }

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(session: &mut Session, command: Command) -> bool {
    match command {
        Command::Health => match session.api().health().await {
            Ok(health) => {
                println!(
                    "{} (up {}s, {})",
                    health.status, health.uptime_seconds, health.timestamp
                );
                true
            }
            Err(e) => {
                error!("Service unavailable: {}", e);
                false
            }
        },
        Command::Create { draft, out } => {
            session.state.draft = draft.into_draft();
            let Some(invitation) = session.save_draft().await else {
                return false;
            };
            print_invitation(&invitation, &[]);
            println!("Share: {}", session.share_link(&invitation.id));

            match out {
                Some(dir) => {
                    session.select_invitation(invitation).await;
                    session
                        .export_pdf(ExportTarget::Selected, &dir)
                        .await
                        .is_some()
                }
                None => true,
            }
        }
        Command::Preview { draft, out } => {
            session.state.draft = draft.into_draft();
            session
                .export_pdf(ExportTarget::Draft, &out)
                .await
                .is_some()
        }
        Command::List { mine } => {
            let (invitations, error) = match mine {
                Some(email) => {
                    session.load_my_invitations(&email).await;
                    let view = &session.state.my_invitations;
                    (view.data.clone(), view.error.clone())
                }
                None => {
                    session.refresh_invitations().await;
                    let view = &session.state.invitations;
                    (view.data.clone(), view.error.clone())
                }
            };
            if error.is_some() {
                return false;
            }
            if invitations.is_empty() {
                println!("No invitations yet.");
            }
            for invitation in &invitations {
                println!(
                    "{}  {}  {}  ({})",
                    invitation.id, invitation.start_datetime, invitation.title, invitation.host
                );
            }
            true
        }
        Command::Show { id } => {
            if !session.open_invitation(&id).await {
                return false;
            }
            match &session.state.selected.data {
                Some(invitation) => {
                    print_invitation(invitation, &session.state.rsvps.data);
                    true
                }
                None => false,
            }
        }
        Command::Rsvp { id, answer } => {
            if !session.open_invitation(&id).await {
                return false;
            }
            session.state.rsvp_draft = answer.into_draft();
            session.submit_rsvp().await.is_some()
        }
        Command::Export { id, out } => {
            if !session.open_invitation(&id).await {
                return false;
            }
            match session.export_pdf(ExportTarget::Selected, &out).await {
                Some(path) => {
                    println!("{}", path.display());
                    true
                }
                None => false,
            }
        }
        Command::Share { id } => {
            println!("{}", session.share_link(&id));
            true
        }
    }
}

fn print_invitation(invitation: &Invitation, rsvps: &[Rsvp]) {
    println!("{}", invitation.title);
    println!("  Hosted by {}", invitation.host);
    println!("  Starts    {}", invitation.start_datetime);
    if let Some(location) = &invitation.location {
        println!("  Where     {}", location);
    }
    if let Some(description) = &invitation.description {
        println!("  {}", description);
    }
    println!("  Type      {}", invitation.event_type.label());
    println!("  Id        {}", invitation.id);

    if !rsvps.is_empty() {
        println!("RSVPs:");
        for rsvp in rsvps {
            match &rsvp.message {
                Some(message) => println!("  {} - {} ({})", rsvp.name, rsvp.status, message),
                None => println!("  {} - {}", rsvp.name, rsvp.status),
            }
        }
    }
}
