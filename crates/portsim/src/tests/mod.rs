//! Integration tests for the portsim command line front end
//!
//! - `pipeline` - CSV on disk through loading, evaluation and console output
