diesel::table! {
    clients (client_id) {
        client_id -> Text,
        name -> Text,
        secret_hash -> Text,
    }
}

diesel::table! {
    codes (id) {
        id -> Text,
        code -> Text,
        client_id -> Text,
        redirect_uri -> Text,
        scope -> Text,
        consumed -> Bool,
    }
}

diesel::table! {
    requests (id) {
        id -> Text,
        client_id -> Text,
        response_type -> Text,
        redirect_uri -> Text,
        state -> Nullable<Text>,
        scope -> Text,
    }
}

diesel::table! {
    tokens (id) {
        id -> Text,
        token -> Text,
        client_id -> Text,
        scope -> Text,
    }
}

diesel::table! {
    uris (client_id, uri) {
        client_id -> Text,
        uri -> Text,
    }
}

diesel::joinable!(codes -> clients (client_id));
diesel::joinable!(requests -> clients (client_id));
diesel::joinable!(tokens -> clients (client_id));
diesel::joinable!(uris -> clients (client_id));

diesel::allow_tables_to_appear_in_same_query!(clients, codes, requests, tokens, uris);
