pub mod checked_http_body;
pub mod http_client;

#[cfg(test)]
pub mod test_server;
