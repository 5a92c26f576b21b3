diesel::table! {
    app_user (id) {
        id -> Int4,
        username -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    cve (cve_id) {
        cve_id -> Text,
        cve_year -> Int4,
        cve_number -> Int4,
        cve_url -> Text,
        nvd_url -> Nullable<Text>,
        nvd_content_exists -> Bool,
        cve_description -> Text,
        cvss3_score -> Nullable<Float8>,
        cvss3_severity -> Nullable<Text>,
        cvss3_vector -> Nullable<Text>,
        cvss2_score -> Nullable<Float8>,
        cvss2_severity -> Nullable<Text>,
        cvss2_vector -> Nullable<Text>,
        published_date -> Nullable<Timestamp>,
        last_modified_date -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    cve_full_text_search (cve_id) {
        cve_id -> Text,
        cve_text_for_search -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    cvss3 (cvss3_severity_code) {
        cvss3_severity_code -> Text,
        cvss3_severity_level -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    cvss2 (cvss2_severity_code) {
        cvss2_severity_code -> Text,
        cvss2_severity_level -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    cve_label (cve_label_id) {
        cve_label_id -> Int4,
        cve_label_code -> Text,
        cve_label_name -> Text,
        display_order -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    cve_severity (cve_severity_code) {
        cve_severity_code -> Text,
        cve_severity_name -> Text,
        display_order -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_cve_label (user_id, cve_id) {
        user_id -> Int4,
        cve_id -> Text,
        cve_label_id -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_cve_comment (user_id, cve_id) {
        user_id -> Int4,
        cve_id -> Text,
        cve_comment -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_keyword (user_id, keyword) {
        user_id -> Int4,
        keyword -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_filter_setting (user_id) {
        user_id -> Int4,
        severity -> Nullable<Text>,
        year -> Nullable<Int4>,
        enable_user_keyword -> Bool,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_filter_setting_cve_label (user_id, cve_label_id) {
        user_id -> Int4,
        cve_label_id -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_mail_address (user_id) {
        user_id -> Int4,
        mail_address -> Text,
        notify_mail -> Bool,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    user_slack_webhook_url (user_id) {
        user_id -> Int4,
        slack_webhook_url -> Text,
        notify_slack -> Bool,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::joinable!(cve_full_text_search -> cve (cve_id));
diesel::joinable!(user_cve_label -> cve_label (cve_label_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_user,
    cve,
    cve_full_text_search,
    cvss3,
    cvss2,
    cve_label,
    cve_severity,
    user_cve_label,
    user_cve_comment,
    user_keyword,
    user_filter_setting,
    user_filter_setting_cve_label,
    user_mail_address,
    user_slack_webhook_url,
);
