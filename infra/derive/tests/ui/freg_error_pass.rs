use freg_derive::freg_error;
use std::borrow::Cow;

#[freg_error]
pub enum LedgerError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Record not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_ledger() -> Result<Vec<u8>, LedgerError> {
    let bytes = std::fs::read("/definitely/not/here").context("Reading ledger")?;
    Ok(bytes)
}

fn main() {
    let _ = read_ledger();
    let err = LedgerError::NotFound { message: "ledger".into(), context: None }
        .with_context("Opening ledger");
    let _: &'static str = err.kind();
}
