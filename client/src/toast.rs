use log::{info, warn};
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Default,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewToast {
    pub title: String,
    pub description: Option<String>,
    pub kind: ToastKind,
    /// `None` keeps the toast until it is dismissed, as does a duration too
    /// long to represent.
    pub duration: Option<Duration>,
}

impl NewToast {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind,
            duration: Some(DEFAULT_TOAST_DURATION),
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub kind: ToastKind,
    expires_at: Option<Instant>,
}

impl Toast {
    pub fn is_sticky(&self) -> bool {
        self.expires_at.is_none()
    }
}

/// Notifications waiting to be shown, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: NewToast) -> u64 {
        self.push_at(toast, Instant::now())
    }

    pub fn push_at(&mut self, toast: NewToast, now: Instant) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        let description = toast.description.as_deref().unwrap_or("");
        match toast.kind {
            ToastKind::Error => warn!("[toast {}] {} {}", id, toast.title, description),
            _ => info!("[toast {}] {} {}", id, toast.title, description),
        }

        self.toasts.push(Toast {
            id,
            title: toast.title,
            description: toast.description,
            kind: toast.kind,
            expires_at: toast.duration.and_then(|d| now.checked_add(d)),
        });
        id
    }

    /// Returns false if the toast was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Removes and returns every toast whose duration has elapsed at `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<Toast> {
        let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.toasts)
            .into_iter()
            .partition(|t| t.expires_at.is_some_and(|at| at <= now));
        self.toasts = active;
        expired
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    /// Empties the queue, e.g. once a CLI run has printed everything.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn has_errors(&self) -> bool {
        self.toasts.iter().any(|t| t.kind == ToastKind::Error)
    }
}
