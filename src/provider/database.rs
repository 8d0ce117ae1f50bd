use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        Business, Business_Assessment, Business_Quarterly, Market_Application,
        Market_Payment, Market_Renter, Market_Stall, Market_Stall_Class,
        RPT_Building, RPT_Land, RPT_Land_Assessment, RPT_Owner, RPT_Quarterly,
        RPT_Tax, Receipt, Table,
    },
};

#[derive(Debug)]
pub struct DatabasePool {
    pub receipt: Table<Receipt>,
    pub rpt_owner: Table<RPT_Owner>,
    pub rpt_land: Table<RPT_Land>,
    pub rpt_land_assessment: Table<RPT_Land_Assessment>,
    pub rpt_building: Table<RPT_Building>,
    pub rpt_tax: Table<RPT_Tax>,
    pub rpt_quarterly: Table<RPT_Quarterly>,
    pub market_stall_class: Table<Market_Stall_Class>,
    pub market_stall: Table<Market_Stall>,
    pub market_application: Table<Market_Application>,
    pub market_renter: Table<Market_Renter>,
    pub market_payment: Table<Market_Payment>,
    pub business: Table<Business>,
    pub business_assessment: Table<Business_Assessment>,
    pub business_quarterly: Table<Business_Quarterly>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .after_connect(|_conn, _meta| Box::pin(async move { Ok(()) }))
            .max_connections(config.max_connections)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            receipt: Table::new(pool.clone()),
            rpt_owner: Table::new(pool.clone()),
            rpt_land: Table::new(pool.clone()),
            rpt_land_assessment: Table::new(pool.clone()),
            rpt_building: Table::new(pool.clone()),
            rpt_tax: Table::new(pool.clone()),
            rpt_quarterly: Table::new(pool.clone()),
            market_stall_class: Table::new(pool.clone()),
            market_stall: Table::new(pool.clone()),
            market_application: Table::new(pool.clone()),
            market_renter: Table::new(pool.clone()),
            market_payment: Table::new(pool.clone()),
            business: Table::new(pool.clone()),
            business_assessment: Table::new(pool.clone()),
            business_quarterly: Table::new(pool.clone()),
            pool,
        }
    }
}
