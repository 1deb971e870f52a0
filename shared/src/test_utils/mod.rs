pub mod http_test_utils;
pub mod mock_invitation_store;
pub mod test_logging;
