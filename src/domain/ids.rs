use rand::{distributions::Alphanumeric, Rng};

const ID_LEN: usize = 9;

/// Returns a short random token used as a local entity id.
pub fn new_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}
