use thiserror::Error;

/// Every way a command can fail. The display text is what the caller sees.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Location access is required for attendance marking")]
    MissingLocation,

    #[error("You have already checked in today")]
    DuplicateCheckIn,

    #[error("No check-in found for today or already checked out")]
    NoOpenCheckIn,

    #[error("Please specify a task title. Say \"add task [task name]\"")]
    EmptyTaskTitle,

    #[error("Task title must be at most {max} characters")]
    TaskTitleTooLong { max: usize },

    #[error("Task command not recognized. Try \"add task [task name]\"")]
    UnrecognizedTask,

    #[error("Query not recognized. Try \"show my tasks\" or \"show attendance\"")]
    UnrecognizedQuery,

    #[error(
        "I can help you with attendance, tasks, and queries. \
         Try saying \"check in\", \"add task\", or \"show my tasks\"."
    )]
    UnrecognizedIntent,

    #[error("Error processing command: {0:#}")]
    Handler(#[from] anyhow::Error),
}
