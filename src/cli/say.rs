//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::core::conversation::{ConversationController, SkipReason, SubmitOutcome};
use crate::core::message::Message;
use crate::core::projection::highlights_for;

pub async fn run_say(
    controller: ConversationController,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let mode = controller.current_mode();
    let outcome = controller.submit(&prompt, mode).await;

    if let SubmitOutcome::Skipped(SkipReason::EmptyInput) = outcome {
        eprintln!("Usage: novahub say [-m MODE] <text>");
        std::process::exit(1);
    }

    if let Some(reply) = controller.messages().last() {
        if let SubmitOutcome::ConnectionFailed = outcome {
            eprintln!("❌ {}", reply.content());
        } else {
            let stdout = io::stdout();
            write_reply(&mut stdout.lock(), reply)?;
        }
    }

    match exit_code(&outcome) {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}

/// Reply text followed by one bullet per highlight.
pub fn write_reply<W: Write>(out: &mut W, reply: &Message) -> io::Result<()> {
    writeln!(out, "{}", reply.content())?;
    for highlight in highlights_for(reply.mode(), reply.metadata()) {
        writeln!(out, "  • {highlight}")?;
    }
    Ok(())
}

/// 1 when the backend could not be reached, 2 when its reply lacked the
/// field the mode displays.
pub fn exit_code(outcome: &SubmitOutcome) -> i32 {
    match outcome {
        SubmitOutcome::Replied(_) => 0,
        SubmitOutcome::ConnectionFailed | SubmitOutcome::Skipped(_) => 1,
        SubmitOutcome::MissingField(_) => 2,
    }
}
