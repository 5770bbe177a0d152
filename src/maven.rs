pub mod coordinates;
pub mod locator;
pub mod metadata_client;
pub mod metadata_xml;
pub mod paths;
pub mod version;
