/// A user request for a transport change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Previous,
    TogglePlayPause,
    Next,
}
