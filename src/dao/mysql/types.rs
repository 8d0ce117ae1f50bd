use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions},
    MySql,
};

pub type PoolType = MySqlPool;
pub type PoolOption = MySqlPoolOptions;
pub type DataBase = MySql;
