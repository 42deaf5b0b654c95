// Session token at rest. The engine keeps sessions in memory; only the
// console persists the bearer token between invocations, via the OS
// keyring.

use keyring::Entry;
use tracing::warn;

const SERVICE: &str = "pinflow";
const ACCOUNT: &str = "api-token";

fn entry() -> Option<Entry> {
    Entry::new(SERVICE, ACCOUNT).ok()
}

pub fn load() -> Option<String> {
    entry()?.get_password().ok()
}

pub fn store(token: &str) {
    if let Some(e) = entry() {
        if let Err(err) = e.set_password(token) {
            warn!("could not store session token in the keyring: {err}");
        }
    }
}

pub fn clear() {
    if let Some(e) = entry() {
        let _ = e.delete_credential();
    }
}
