pub mod mock_logger;
