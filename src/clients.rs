pub mod image_client;
