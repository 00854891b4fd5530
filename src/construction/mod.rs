pub mod nearest_successor;
