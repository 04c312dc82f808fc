//! Output macros shared by every crate.
//!
//! Results go to stdout, failures to stderr. Diagnostics belong in `tracing`,
//! not here.

#[macro_export]
macro_rules! ctl_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! ctl_error {
    ($($arg:tt)*) => {
        eprintln!("{}", format!($($arg)*));
    }
}
