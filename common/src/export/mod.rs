//! Núcleo de exportação compartilhado (sem I/O)

pub mod report_core;
