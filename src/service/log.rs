use colored::Colorize;
use env_logger::Builder;
use log::{info, warn, Level};
use std::io::Write;
use std::time::{Duration, Instant};
use std::future::{ready, Ready};
use actix_web::{
   dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
   http::StatusCode,
   Error,
};
use futures_util::future::LocalBoxFuture;

pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
   S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
   S::Future: 'static,
   B: 'static,
{
   type Response = ServiceResponse<B>;
   type Error = Error;
   type InitError = ();
   type Transform = LoggerMiddlewareService<S>;
   type Future = Ready<Result<Self::Transform, Self::InitError>>;

   fn new_transform(&self, service: S) -> Self::Future {
      ready(Ok(LoggerMiddlewareService { service }))
   }
}

pub struct LoggerMiddlewareService<S> {
   service: S
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
   type Response = ServiceResponse<B>;
   type Error = Error;
   type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

   forward_ready!(service);

   fn call(&self, req: ServiceRequest) -> Self::Future {
      let route = format!("{} {}", req.method(), req.path());
      let started = Instant::now();
      let fut = self.service.call(req);

      Box::pin(async move {
         let res = fut.await?;
         let line = response_line(&route, res.status(), started.elapsed());
         if res.status().is_server_error() {
            warn!("{}", line);
         } else {
            info!("{}", line);
         }
         Ok(res)
      })
   }
}

fn response_line(route: &str, status: StatusCode, elapsed: Duration) -> String {
   format!("{} -> {} in {}ms", route, status.as_u16(), elapsed.as_millis())
}

pub fn init_logger() {
   Builder::from_default_env()
   .filter_level(log::LevelFilter::Info)
   .parse_default_env()
   .format(|buf, record| {
      let level = record.level().to_string();
      let level = match record.level() {
         Level::Error => level.red().bold(),
         Level::Warn => level.yellow().bold(),
         Level::Info => level.green().bold(),
         Level::Debug => level.blue().bold(),
         Level::Trace => level.magenta().bold(),
      };
      writeln!(
         buf,
         "{} {} [{}] {}",
         chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
         level,
         record.target(),
         record.args()
      )
   })
   .init()
}
