mod achievements;
mod chapters;
mod home;
mod notifications;
mod progress;
mod support;
