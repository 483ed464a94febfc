pub mod compile_time {
    pub mod lexical {
        /// Maximum clause text length accepted by the splitter (64KB)
        /// SECURITY: Prevents DoS attacks via enormous clause strings
        pub const MAX_CLAUSE_LENGTH: usize = 65_536;

        /// Maximum length of a single word or number token
        /// SECURITY: Bounds allocation per token
        pub const MAX_TOKEN_LENGTH: usize = 4_096;
    }

    pub mod compiler {
        /// Maximum key/value pairs in one clause
        /// SECURITY: Prevents DoS via parameter explosion
        pub const MAX_PARAMETERS_PER_CLAUSE: usize = 1_024;

        /// Maximum operations in any one filter chain
        /// RESOURCE: Each filter is a full image pass downstream
        pub const MAX_FILTERS_PER_CHAIN: usize = 256;
    }

    pub mod batch_processing {
        /// Maximum number of worker threads for batch compilation
        /// RESOURCE: Controls system resource consumption
        pub const MAX_WORKER_THREADS: usize = 8;

        /// Maximum clauses per batch to prevent memory exhaustion
        /// SECURITY: Prevents DoS via batch size explosion
        pub const MAX_CLAUSES_PER_BATCH: usize = 100_000;
    }

    pub mod logging {
        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
