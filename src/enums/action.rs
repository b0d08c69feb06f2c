use serde::Serialize;

/// Button pressed on the review form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Save,
    Previous,
    Next,
}

impl Action {
    pub const MARKERS: [(&'static str, Action); 3] = [
        ("previous", Action::Previous),
        ("next", Action::Next),
        ("save", Action::Save),
    ];

    pub fn from_marker(name: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| *marker == name)
            .map(|(_, action)| *action)
    }

    pub fn marker(self) -> &'static str {
        match self {
            Action::Save => "save",
            Action::Previous => "previous",
            Action::Next => "next",
        }
    }
}
