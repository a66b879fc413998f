pub mod notion_client;
