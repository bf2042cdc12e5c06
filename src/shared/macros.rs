/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result`, logging the error and exiting the process on failure.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
    };
}

/// Locks a mutex, recovering the guard if another thread panicked while holding it.
/// `$name` is only evaluated on recovery and names the lock in the warning.
#[macro_export]
macro_rules! lock_or_recover {
    ($mutex:expr, $name:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Recovered poisoned lock: {}", $name);
                poisoned.into_inner()
            }
        }
    };
}

/***************************************/
/*             Unit tests              */
/***************************************/
