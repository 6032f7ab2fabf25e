use super::schema::trains;

#[derive(Debug, Queryable, Clone)]
pub struct TrainRow {
    pub id: i64,
    pub destination: String,
    pub number: String,
    pub time: String,
}

#[derive(Insertable)]
#[table_name = "trains"]
pub struct InsertFull<'a> {
    pub destination: &'a str,
    pub number: &'a str,
    pub time: &'a str,
}
