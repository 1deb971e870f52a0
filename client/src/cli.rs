use clap::{Args, Parser, Subcommand};
use invitely_client::share::parse_invite_reference;
use invitely_client::state::{InvitationDraft, RsvpDraft};
use invitely_shared::models::{EventType, RsvpStatus};
use std::path::PathBuf;

/// Create, share and export event invitations.
///
/// The service address and share-link base come from API_BASE_URL and
/// APP_URL; RUST_LOG controls logging.
#[derive(Parser, Debug)]
#[command(name = "invitely", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Check that the service is up.
    Health,

    /// Create an invitation, and export it when --out is given.
    Create {
        #[command(flatten)]
        draft: DraftArgs,

        /// Directory to write the PDF into.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export the card for a draft without saving it.
    Preview {
        #[command(flatten)]
        draft: DraftArgs,

        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Recent invitations, or the ones created with an email address.
    List {
        #[arg(long, value_name = "EMAIL")]
        mine: Option<String>,
    },

    /// An invitation and its RSVPs.
    Show {
        /// Invitation id or share link.
        #[arg(value_parser = parse_reference)]
        id: String,
    },

    /// Answer an invitation.
    Rsvp {
        /// Invitation id or share link.
        #[arg(value_parser = parse_reference)]
        id: String,

        #[command(flatten)]
        answer: RsvpArgs,
    },

    /// Save an invitation as a PDF.
    Export {
        /// Invitation id or share link.
        #[arg(value_parser = parse_reference)]
        id: String,

        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Print the share link for an invitation.
    Share {
        #[arg(value_parser = parse_reference)]
        id: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DraftArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    /// Start date and time, ISO-8601.
    #[arg(long, value_name = "ISO")]
    pub start: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// birthday, wedding, anniversary, baby_shower, graduation, corporate,
    /// meetup or other.
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_event_type)]
    pub event_type: Option<EventType>,

    /// CSS gradient, image URL or data URI.
    #[arg(long, value_name = "CSS|URL")]
    pub background: Option<String>,

    /// Creator email, used by `list --mine`.
    #[arg(long)]
    pub email: Option<String>,
}

impl DraftArgs {
    pub fn into_draft(self) -> InvitationDraft {
        InvitationDraft {
            title: self.title.unwrap_or_default(),
            host: self.host.unwrap_or_default(),
            start_date_time: self.start.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            event_type: self.event_type.unwrap_or_default(),
            background_image_url: self.background.unwrap_or_default(),
            creator_email: self.email.unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RsvpArgs {
    #[arg(long)]
    pub name: String,

    /// yes, no or maybe.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<RsvpStatus>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub message: Option<String>,
}

impl RsvpArgs {
    pub fn into_draft(self) -> RsvpDraft {
        RsvpDraft {
            name: self.name,
            email: self.email.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        }
    }
}

fn parse_event_type(value: &str) -> Result<EventType, String> {
    EventType::parse(value).ok_or_else(|| format!("unknown event type `{}`", value))
}

fn parse_status(value: &str) -> Result<RsvpStatus, String> {
    RsvpStatus::parse(value).ok_or_else(|| "expected yes, no or maybe".to_string())
}

fn parse_reference(value: &str) -> Result<String, String> {
    parse_invite_reference(value).ok_or_else(|| "not an invitation id or share link".to_string())
}
