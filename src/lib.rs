// Library root
// -----------
// The `sauvegarde` binary uploads local album folders that are missing from
// a Google Drive folder. `main.rs` wires these modules together.
//
// Module responsibilities:
// - `local`, `diff`: what exists on disk and what the remote lacks.
// - `storage`: the client contract; `drive` is the live Google Drive
//   implementation (with `auth` and `retry`), `dry_run` the simulated one.
// - `sync`: the orchestrator, reporting through `report` and narrowing the
//   work through `select`.
// - `cli`, `config`, `logging`, `console`, `ui`: the terminal application.
//
// The orchestrator only sees traits, so the whole flow is testable without
// a network or a terminal.
pub mod auth;
pub mod cli;
pub mod config;
pub mod console;
pub mod diff;
pub mod drive;
pub mod dry_run;
pub mod local;
pub mod logging;
pub mod report;
pub mod retry;
pub mod select;
pub mod storage;
pub mod sync;
pub mod ui;
