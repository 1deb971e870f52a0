//! The client's controller: every user action goes through a [`Session`],
//! which calls the service, updates [`ClientState`] and reports the outcome
//! on the toast queue. Actions never return errors; failures end up as an
//! error string on the affected view and an error toast.

use invitely_shared::models::{Invitation, Rsvp};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::export::background::{Backdrop, BackgroundSource};
use crate::export::preview::PreviewCard;
use crate::export::{export_invitation_pdf, save_pdf, ExportError};
use crate::share::ShareLinks;
use crate::state::{ClientState, Tab};
use crate::toast::{NewToast, ToastQueue};

/// Which card a PDF export renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// The live preview of the create form.
    Draft,
    /// The invitation open in the view tab.
    Selected,
}

pub struct Session {
    api: ApiClient,
    share_links: ShareLinks,
    pub state: ClientState,
    pub toasts: ToastQueue,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(&config.api_base_url)?,
            share_links: ShareLinks::new(&config.app_url)?,
            state: ClientState::new(),
            toasts: ToastQueue::new(),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn share_link(&self, invitation_id: &str) -> String {
        self.share_links.link_for(invitation_id)
    }

    /// Handles the location the client was opened with. A share link opens
    /// its invitation in the view tab.
    pub async fn open_location(&mut self, location: &str) -> bool {
        match self.state.open_location(location) {
            Some(id) => {
                info!("Opening shared invitation {}", id);
                self.fetch_selection(&id).await
            }
            None => false,
        }
    }

    pub async fn save_draft(&mut self) -> Option<Invitation> {
        self.state.saving = true;
        let result = self.api.create_invitation(&self.state.draft).await;
        self.state.saving = false;

        match result {
            Ok(invitation) => {
                let link = self.share_link(&invitation.id);
                self.toasts
                    .push(NewToast::success("Invitation created").description(link));
                self.state.invitations.data.insert(0, invitation.clone());
                self.state.last_created = Some(invitation.clone());
                self.state.reset_draft();
                Some(invitation)
            }
            Err(err) => {
                self.toasts.push(
                    NewToast::error("Failed to create invitation").description(err.to_string()),
                );
                None
            }
        }
    }

    pub async fn refresh_invitations(&mut self) {
        self.state.invitations.start();
        match self.api.list_invitations(None).await {
            Ok(invitations) => self.state.invitations.succeed(invitations),
            Err(err) => {
                let message = err.to_string();
                self.state.invitations.fail(message.clone());
                self.toasts
                    .push(NewToast::error("Failed to load invitations").description(message));
            }
        }
    }

    /// Lists the invitations created with `email`. Not an authenticated
    /// view: anyone who knows the address sees the same list.
    pub async fn load_my_invitations(&mut self, email: &str) {
        self.state.active_tab = Tab::Mine;
        self.state.my_email = email.trim().to_string();

        if self.state.my_email.is_empty() {
            self.state.my_invitations.fail("Email required".to_string());
            self.toasts.push(NewToast::error("Email required"));
            return;
        }

        self.state.my_invitations.start();
        match self.api.list_invitations(Some(&self.state.my_email)).await {
            Ok(invitations) => self.state.my_invitations.succeed(invitations),
            Err(err) => {
                let message = err.to_string();
                self.state.my_invitations.fail(message.clone());
                self.toasts
                    .push(NewToast::error("Failed to load your invitations").description(message));
            }
        }
    }

    /// Fetches an invitation by id and, when it is still the selection once
    /// it arrives, its RSVPs.
    pub async fn open_invitation(&mut self, id: &str) -> bool {
        self.state.begin_selection(id);
        self.fetch_selection(id).await
    }

    /// Opens an invitation that is already loaded, e.g. from a list.
    pub async fn select_invitation(&mut self, invitation: Invitation) {
        let id = invitation.id.clone();
        self.state.select(invitation);
        self.refresh_rsvps_for(&id).await;
    }

    pub async fn refresh_rsvps(&mut self) {
        if let Some(id) = self.state.selected_id().map(str::to_string) {
            self.refresh_rsvps_for(&id).await;
        }
    }

    pub async fn submit_rsvp(&mut self) -> Option<Rsvp> {
        let Some(id) = self.state.selected_id().map(str::to_string) else {
            self.toasts.push(NewToast::error("No invitation selected"));
            return None;
        };
        if !self.state.rsvp_draft.has_name() {
            self.toasts.push(NewToast::error("Name required"));
            return None;
        }

        self.state.submitting_rsvp = true;
        let result = self.api.create_rsvp(&id, &self.state.rsvp_draft).await;
        self.state.submitting_rsvp = false;

        match result {
            Ok(rsvp) => {
                let summary = format!("{} - {}", rsvp.name, rsvp.status);
                if !self.state.record_rsvp(rsvp.clone()) {
                    debug!("RSVP {} stored after the selection changed", rsvp.id);
                }
                self.toasts
                    .push(NewToast::success("RSVP sent").description(summary));
                Some(rsvp)
            }
            Err(err) => {
                self.toasts
                    .push(NewToast::error("Failed to send RSVP").description(err.to_string()));
                None
            }
        }
    }

    /// Renders the chosen card to a PDF in `out_dir`.
    pub async fn export_pdf(&mut self, target: ExportTarget, out_dir: &Path) -> Option<PathBuf> {
        match self.try_export_pdf(target, out_dir).await {
            Ok(path) => {
                self.toasts.push(
                    NewToast::success("PDF saved").description(path.display().to_string()),
                );
                Some(path)
            }
            Err(err) => {
                self.toasts
                    .push(NewToast::error("PDF export failed").description(err.to_string()));
                None
            }
        }
    }

    async fn try_export_pdf(
        &self,
        target: ExportTarget,
        out_dir: &Path,
    ) -> std::result::Result<PathBuf, ExportError> {
        let card = match target {
            ExportTarget::Draft => PreviewCard::from_draft(&self.state.draft),
            ExportTarget::Selected => self
                .state
                .selected
                .data
                .as_ref()
                .map(PreviewCard::from_invitation)
                .ok_or_else(|| ExportError::MissingPreview("no invitation selected".to_string()))?,
        };

        let backdrop = self.resolve_backdrop(&card.background).await?;

        // Rasterizing and encoding are CPU bound
        let pdf = tokio::task::spawn_blocking(move || export_invitation_pdf(&card, &backdrop))
            .await
            .map_err(|e| ExportError::Io(std::io::Error::other(e)))??;

        save_pdf(&pdf, out_dir)
    }

    async fn resolve_backdrop(&self, background: &str) -> std::result::Result<Backdrop, ExportError> {
        match BackgroundSource::parse(background)? {
            BackgroundSource::Gradient(gradient) => Ok(Backdrop::Gradient(gradient)),
            BackgroundSource::Inline(bytes) => Backdrop::from_image_bytes(&bytes),
            BackgroundSource::Remote(url) => {
                let bytes = self.api.fetch_bytes(&url).await.map_err(|e| {
                    warn!("Could not download background {}: {}", url, e);
                    ExportError::Background(e.to_string())
                })?;
                Backdrop::from_image_bytes(&bytes)
            }
        }
    }

    async fn fetch_selection(&mut self, id: &str) -> bool {
        let result = self
            .api
            .get_invitation(id)
            .await
            .map_err(|e| e.to_string());
        let found = result.is_ok();

        if let Err(message) = &result {
            if self.state.is_selected(id) {
                self.toasts
                    .push(NewToast::error("Could not open invitation").description(message.clone()));
            }
        }
        if !self.state.finish_selection(id, result) {
            debug!("Dropped stale invitation response for {}", id);
            return false;
        }

        if found {
            self.refresh_rsvps_for(id).await;
        }
        found
    }

    async fn refresh_rsvps_for(&mut self, id: &str) {
        if !self.state.begin_rsvps(id) {
            return;
        }
        let result = self.api.list_rsvps(id).await.map_err(|e| e.to_string());
        if let Err(message) = &result {
            self.toasts
                .push(NewToast::error("Failed to load RSVPs").description(message.clone()));
        }
        if !self.state.finish_rsvps(id, result) {
            debug!("Dropped stale RSVP list for {}", id);
        }
    }
}
