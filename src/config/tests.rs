use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(settings.server.admin_addr.port(), DEFAULT_ADMIN_PORT);
    assert!(settings.database.url.is_none());
    assert_eq!(settings.auth.session_ttl, Duration::from_secs(12 * 3600));
    assert_eq!(settings.auth.bcrypt_cost, DEFAULT_BCRYPT_COST);
    assert!(!settings.auth.cookie_secure);
    assert_eq!(settings.site.title, DEFAULT_SITE_TITLE);
    assert_eq!(settings.site.public_url, DEFAULT_PUBLIC_URL);
    assert_eq!(settings.site.timezone, Tz::UTC);
    assert_eq!(settings.site.blog_page_size.get(), DEFAULT_BLOG_PAGE_SIZE);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn auth_overrides_apply_to_session_settings() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        auth_session_ttl_hours: Some(2),
        auth_cookie_secure: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.auth.session_ttl, Duration::from_secs(7200));
    assert!(settings.auth.cookie_secure);
}

#[test]
fn zero_session_ttl_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.session_ttl_hours = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero ttl rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "auth.session_ttl_hours",
            ..
        }
    ));
}

#[test]
fn bcrypt_cost_outside_supported_range_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.bcrypt_cost = Some(3);

    let err = Settings::from_raw(raw).expect_err("cost rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "auth.bcrypt_cost",
            ..
        }
    ));
}

#[test]
fn shared_listener_address_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(8080);
    raw.server.admin_port = Some(8080);

    let err = Settings::from_raw(raw).expect_err("shared address rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.admin_port",
            ..
        }
    ));
}

#[test]
fn public_url_gains_trailing_slash() {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("https://example.com/me".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.public_url, "https://example.com/me/");
}

#[test]
fn unknown_timezone_is_rejected() {
    let mut raw = RawSettings::default();
    raw.site.timezone = Some("Mars/Olympus".to_string());

    let err = Settings::from_raw(raw).expect_err("timezone rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.timezone",
            ..
        }
    ));
}

#[test]
fn social_links_require_http_urls() {
    let mut raw = RawSettings::default();
    raw.site.social_links = vec![RawSocialLink {
        name: Some("GitHub".to_string()),
        url: Some("ftp://github.com/someone".to_string()),
        handle: None,
    }];

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn blank_contact_fields_are_dropped() {
    let mut raw = RawSettings::default();
    raw.site.contact_email = Some("  ".to_string());
    raw.site.contact_phone = Some(" +1 (555) 123-4567 ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.site.contact_email.is_none());
    assert_eq!(
        settings.site.contact_phone.as_deref(),
        Some("+1 (555) 123-4567")
    );
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["folio"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "folio",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("postgres://override")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_admin_create_arguments() {
    let args = CliArgs::parse_from([
        "folio",
        "admin",
        "--database-url",
        "postgres://example",
        "create",
        "--email",
        "me@example.com",
        "--password",
        "hunter22",
    ]);

    match args.command.expect("admin command") {
        Command::Admin(admin) => {
            assert_eq!(
                admin.database.database_url.as_deref(),
                Some("postgres://example")
            );
            match admin.command {
                AdminCommand::Create(credentials) => {
                    assert_eq!(credentials.email, "me@example.com");
                    assert_eq!(credentials.password, "hunter22");
                }
                other => panic!("unexpected admin command: {other:?}"),
            }
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["folio", "migrate", "--database-url", "postgres://m"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(migrate.database.database_url.as_deref(), Some("postgres://m"));
        }
        _ => panic!("wrong command parsed"),
    }
}
