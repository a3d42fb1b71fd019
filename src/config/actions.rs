#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Suspend,
    NextTab,
    PrevTab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    NextField,
    PrevField,
    NextOption,
    PrevOption,
    Submit,
    Reload,
    ScrollUp,
    ScrollDown,
}
