// Interface adapters: backend client, local storage, scanner and console.

pub mod clients;
pub mod console;
pub mod protocol;
pub mod scanner;
pub mod session_file;
pub mod state;
