mod mock;
mod pipeline_tests;
