pub mod websites;
