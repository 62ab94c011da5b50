pub mod mock_machine;
