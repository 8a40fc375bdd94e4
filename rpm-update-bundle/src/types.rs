use time::Date;

pub type RepoList = Vec<String>;

/// The two snapshot dates being compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub today: Date,
}

impl DateWindow {
    pub fn start_name(&self) -> String {
        self.start.to_string()
    }

    pub fn today_name(&self) -> String {
        self.today.to_string()
    }
}

/// What the user asked us to bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Nothing,
    Repos(RepoList),
}
