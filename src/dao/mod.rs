mod mysql;

pub use mysql::{get_path, DataBase, PoolOption, PoolType};
