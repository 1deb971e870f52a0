use invitely_shared::models::{EventType, Invitation, Rsvp, RsvpStatus};
use serde::Serialize;

use crate::share::invite_id_from_location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Create,
    View,
    Mine,
}

/// Form contents for a new invitation. Blank fields are left out of the
/// request body so the service applies its own defaults.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDraft {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_date_time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub background_image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub creator_email: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct RsvpDraft {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub status: RsvpStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl RsvpDraft {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Data for one view together with its loading flag and last error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loadable<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Loadable<T> {
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    /// Keeps whatever data was shown before.
    pub fn fail(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }
}

/// Everything a front end keeps between requests.
///
/// The selection is tracked by id: a fetch for an invitation that is no
/// longer selected is dropped when it completes, so a slow response never
/// overwrites a newer selection or its RSVP list.
#[derive(Debug, Default)]
pub struct ClientState {
    pub active_tab: Tab,
    pub draft: InvitationDraft,
    pub saving: bool,
    pub last_created: Option<Invitation>,
    pub invitations: Loadable<Vec<Invitation>>,
    pub my_email: String,
    pub my_invitations: Loadable<Vec<Invitation>>,
    pub selected: Loadable<Option<Invitation>>,
    pub rsvps: Loadable<Vec<Rsvp>>,
    pub rsvp_draft: RsvpDraft,
    pub submitting_rsvp: bool,
    selected_id: Option<String>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a share link. Returns the invitation id to fetch when the
    /// location carries one.
    pub fn open_location(&mut self, location: &str) -> Option<String> {
        let id = invite_id_from_location(location)?;
        self.begin_selection(&id);
        Some(id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    /// Switches to the view tab and marks `id` as the invitation being
    /// fetched. RSVPs of the previous selection are cleared.
    pub fn begin_selection(&mut self, id: &str) {
        self.active_tab = Tab::View;
        self.selected_id = Some(id.to_string());
        self.selected.start();
        self.rsvps = Loadable::default();
        self.rsvp_draft = RsvpDraft::default();
    }

    /// Selects an invitation that is already loaded, e.g. from a list.
    pub fn select(&mut self, invitation: Invitation) {
        self.begin_selection(&invitation.id);
        self.selected.succeed(Some(invitation));
    }

    /// Returns false when the response is stale and was dropped.
    pub fn finish_selection(&mut self, id: &str, result: Result<Invitation, String>) -> bool {
        if !self.is_selected(id) {
            return false;
        }
        match result {
            Ok(invitation) => self.selected.succeed(Some(invitation)),
            Err(error) => {
                self.selected.data = None;
                self.selected.fail(error);
            }
        }
        true
    }

    pub fn begin_rsvps(&mut self, id: &str) -> bool {
        if !self.is_selected(id) {
            return false;
        }
        self.rsvps.start();
        true
    }

    pub fn finish_rsvps(&mut self, id: &str, result: Result<Vec<Rsvp>, String>) -> bool {
        if !self.is_selected(id) {
            return false;
        }
        match result {
            Ok(rsvps) => self.rsvps.succeed(rsvps),
            Err(error) => self.rsvps.fail(error),
        }
        true
    }

    /// Appends a freshly stored RSVP and resets the RSVP form.
    pub fn record_rsvp(&mut self, rsvp: Rsvp) -> bool {
        if !self.is_selected(&rsvp.invitation_id) {
            return false;
        }
        self.rsvps.data.push(rsvp);
        self.rsvp_draft = RsvpDraft::default();
        true
    }

    /// Clears the form, keeping the creator email so "My Invitations"
    /// keeps working across drafts.
    pub fn reset_draft(&mut self) {
        let creator_email = std::mem::take(&mut self.draft.creator_email);
        self.draft = InvitationDraft {
            creator_email,
            ..Default::default()
        };
    }
}
