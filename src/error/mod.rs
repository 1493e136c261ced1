use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmuFeError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    #[error("System `{0}` is not in the catalog")]
    SystemNotFound(String),

    #[error("Invalid catalog: {message}")]
    InvalidCatalog {
        message: String
    },

    #[error("Game `{game}` references unknown system `{system_id}`, the library is out of sync with the catalog")]
    UnknownSystem {
        game: String,
        system_id: String
    },

    #[error("Emulator not found at `{}`. Place the emulator package under the Emulators folder", .path.display())]
    EmulatorMissing {
        path: PathBuf
    },

    #[error("Core `{core}` not found at `{}`. Install the core file in the cores folder", .path.display())]
    CoreMissing {
        core: String,
        path: PathBuf
    },

    #[error("Launch failed: {message}")]
    LaunchFailed {
        message: String
    },
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO Error")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Cannot read directory `{}`: {source}", .path.display())]
    UnreadableDirectory {
        path: PathBuf,
        source: io::Error,
    },
}
