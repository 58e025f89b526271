//! Configuration and constants for the analyzer.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Nanoseconds per second, for converting raw trace timestamps
pub const NS_PER_SEC: f64 = 1e9;

/// Start of the nsys CSV header line. Everything before this line in an
/// export is free-form preamble and is skipped.
pub const NSYS_HEADER_KEY: &str = "Start (ns),End (ns)";

/// Collective read marking the input I/O phase boundary
pub const BULK_READ_EVENT: &str = "MPI_File_read_at_all";

/// Collective write marking the output I/O phase boundary
pub const BULK_WRITE_EVENT: &str = "MPI_File_write_at_all";

/// File close event, paired with the bulk read/write that precedes it
pub const CLOSE_EVENT: &str = "MPI_File_close";

/// Communication primitives counted into the communication bucket
pub const COMM_EVENTS: &[&str] = &[
    "MPI_Waitall",
    "MPI_Allreduce",
    "MPI_Barrier",
    "MPI_Isend",
    "MPI_Irecv",
    "MPI_Send",
    "MPI_Recv",
];

/// Initialization events used as the preprocessing fallback when a trace
/// has no bulk read at all
pub const INIT_EVENTS: &[&str] = &["MPI_Init", "MPI_File_open"];
