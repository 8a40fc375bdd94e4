#[macro_export]
macro_rules! verbose {
    ($opts:expr, $($arg:tt)*) => {
        if $opts.verbose {
            println!($($arg)*);
        }
    };
}

/// Reports something the run can carry on after. Always goes to stderr.
#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {{
        use $crate::colored::Colorize;
        eprintln!("{} {}", "WARNING:".yellow().bold(), format!($($arg)*));
    }};
}
