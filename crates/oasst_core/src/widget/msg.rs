#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetMsg {
    /// Reveal delay elapsed; show the modal.
    Revealed,
    /// User clicked the close button or outside the modal.
    CloseClicked,
    /// User edited the question input.
    QuestionChanged(String),
    /// User clicked Ask.
    AskClicked,
    /// Visible page text collected for the pending question.
    PageTextGathered(String),
    /// Endpoint answered with `summ`.
    AnswerReceived(String),
    /// Network or decoding failure while asking.
    AskFailed(String),
    /// Fallback for placeholder wiring.
    NoOp,
}
