use super::schema::stations;

#[derive(Insertable)]
#[table_name = "stations"]
pub struct InsertFull<'a> {
    pub station_name: &'a str,
    pub train_id: Option<i64>,
}
