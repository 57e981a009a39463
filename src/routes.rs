use crate::{
    api::{attendance, employee, location, payroll, service},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(build_limiter(config.rate_register_per_min))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(build_limiter(config.rate_refresh_per_min))
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::post().to(attendance::create_attendance)))
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/check-out
                    .service(
                        web::resource("/check-out").route(web::put().to(attendance::check_out)),
                    )
                    // /attendance/me
                    .service(web::resource("/me").route(web::get().to(attendance::my_attendance)))
                    // /attendance/today
                    .service(
                        web::resource("/today").route(web::get().to(attendance::today_attendance)),
                    ),
            )
            .service(
                web::scope("/location")
                    // /location
                    .service(web::resource("").route(web::post().to(location::record_location)))
                    // /location/{employee_id}
                    .service(
                        web::resource("/{employee_id}").route(web::get().to(location::list_fixes)),
                    ),
            )
            .service(
                web::scope("/distance")
                    // /distance/me
                    .service(web::resource("/me").route(web::get().to(location::my_distances)))
                    // /distance/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(location::employee_distances)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::list_payrolls)))
                    // /payroll/me
                    .service(web::resource("/me").route(web::get().to(payroll::my_payrolls)))
                    // /payroll/{id}: POST runs the calculator for an
                    // employee id, GET fetches a payroll record by id
                    .service(
                        web::resource("/{id}")
                            .route(web::post().to(payroll::generate_payroll))
                            .route(web::get().to(payroll::get_payroll)),
                    )
                    // /payroll/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(payroll::approve_payroll)),
                    )
                    // /payroll/{id}/pay
                    .service(web::resource("/{id}/pay").route(web::put().to(payroll::pay_payroll))),
            )
            .service(
                web::scope("/services")
                    // /services
                    .service(
                        web::resource("")
                            .route(web::get().to(service::list_services))
                            .route(web::post().to(service::create_service)),
                    )
                    // /services/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(service::get_service))
                            .route(web::put().to(service::update_service))
                            .route(web::delete().to(service::delete_service)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
