table! {
    trains (id) {
        id -> BigInt,
        destination -> Text,
        number -> Text,
        time -> Text,
    }
}

table! {
    stations (id) {
        id -> BigInt,
        station_name -> Text,
        train_id -> Nullable<BigInt>,
    }
}

allow_tables_to_appear_in_same_query!(trains, stations);

joinable!(stations -> trains(train_id));
