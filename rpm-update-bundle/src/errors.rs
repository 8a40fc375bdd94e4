use thiserror::Error;

/// Conditions which end the run with a specific exit status. Anything else which goes wrong
/// exits 1.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Fatal {
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("no repositories have new packages between {start} and {today}")]
    NoQualifyingRepos { start: String, today: String },
    #[error("{0} compression is not supported")]
    UnsupportedCompression(String),
    #[error("interrupted")]
    Interrupted,
}

impl Fatal {
    pub fn exit_code(&self) -> i32 {
        match self {
            Fatal::InvalidDate(_) => 2,
            Fatal::NoQualifyingRepos { .. } => 3,
            Fatal::UnsupportedCompression(_) => 4,
            Fatal::Interrupted => 130,
        }
    }
}

/// Exit status for any error coming out of a run.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Fatal>().map_or(1, Fatal::exit_code)
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code() {
        assert_eq!(2, exit_code(&Fatal::InvalidDate("x".into()).into()));
        assert_eq!(1, exit_code(&anyhow::anyhow!("tar failed")));

        let wrapped = Err::<(), Fatal>(Fatal::Interrupted)
            .context("choosing repositories")
            .unwrap_err();
        assert_eq!(130, exit_code(&wrapped));
    }
}
