use bevy::app::AppExit;
use bevy::prelude::*;

/// 面向玩家的一行输出，由 `forward_log_event` 打印
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

pub fn exit_on_shutdown(mut app_exit: EventWriter<AppExit>) {
    app_exit.write(AppExit::error());
}
