/// delete every cache key matching a pattern. failures are logged, never returned
macro_rules! delete_keys {
    ($conn:expr, $pattern:expr, $target:expr) => {
        match Redis::keys($conn, $pattern) {
            Ok(keys) => {
                for key in keys {
                    if let Err(error) = Redis::delete($conn, &key) {
                        error!(target:$target, "Error while deleting key: {}", error);
                    }
                }
            }
            Err(error) => {
                error!(target:$target, "Error while listing keys: {}", error);
            }
        }
    }
}

pub(crate) use delete_keys;
