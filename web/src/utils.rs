use gloo::storage::{LocalStorage, Storage};

/// The single named save slot in localStorage. Writing overwrites whatever is
/// there; `clear` removes the slot outright. All failures are best-effort:
/// quota or privacy-mode errors are logged and play continues.
pub(crate) struct SaveSlot;

impl SaveSlot {
    pub(crate) const KEY: &'static str = "geomerge:save:v2";

    pub(crate) fn load() -> Option<String> {
        LocalStorage::raw().get_item(Self::KEY).ok().flatten()
    }

    pub(crate) fn store(json: &str) {
        if let Err(err) = LocalStorage::raw().set_item(Self::KEY, json) {
            log::error!("could not write save slot: {:?}", err);
        }
    }

    pub(crate) fn clear() {
        if let Err(err) = LocalStorage::raw().remove_item(Self::KEY) {
            log::error!("could not clear save slot: {:?}", err);
        }
    }
}
