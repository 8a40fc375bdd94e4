/// Behaviour switches every tool takes from its command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Opts {
    pub verbose: bool,
    pub noop: bool,
}
