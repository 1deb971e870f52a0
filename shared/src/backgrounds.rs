use crate::models::EventType;

/// Default background for each event type. The client preview uses the
/// same table, so a preview always matches the stored value.
pub fn default_background_for(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Birthday => "linear-gradient(135deg,#f59e0b,#f472b6)",
        EventType::Wedding => "linear-gradient(135deg,#f5d0fe,#9333ea)",
        EventType::Anniversary => "linear-gradient(135deg,#fde68a,#fca5a5)",
        EventType::BabyShower => "linear-gradient(135deg,#bfdbfe,#c084fc)",
        EventType::Graduation => "linear-gradient(135deg,#93c5fd,#1d4ed8)",
        EventType::Corporate => "linear-gradient(135deg,#cbd5e1,#64748b)",
        EventType::Meetup => "linear-gradient(135deg,#6ee7b7,#3b82f6)",
        EventType::Other => "linear-gradient(135deg,#e5e7eb,#9ca3af)",
    }
}
