//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::{events::LogEvent, states::AppState};
use crate::data::{ItemCatalog, schema::ItemId};
use crate::inventory::{InventorySet, bag::ItemBag, events::*};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

const HELP: &str = "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  items                  列出所有物品
  items <token>          用 id / uuid / 名称 查询单个物品
  give <id> [count]      放入物品
  take <id> [count]      取出物品
  count <id>             查询持有数量
  inventory              查看背包
  click <slot>           点击格子
  save                   保存背包
  load                   读取背包";

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let Ok(mut buf) = buffer.lock() else {
                        break;
                    };
                    buf.push_back(line.to_string());
                }
            });
        }
        add_cli_systems(app);
    }
}

/// 注册命令处理系统；命令在同一帧内先于背包系统执行
fn add_cli_systems(app: &mut App) {
    app
        // 事件：原始输入行
        .add_event::<CliLine>()
        // 每帧从 buffer 取出所有命令行写入事件
        .add_systems(Update, read_stdin)
        // 仅在 InGame 处理命令
        .add_systems(
            Update,
            execute_cli_commands
                .after(read_stdin)
                .before(InventorySet)
                .run_if(in_state(AppState::InGame)),
        );
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Give { id: ItemId, count: u32 },
    Take { id: ItemId, count: u32 },
    Count(ItemId),
    Inventory,
    Click(usize),
    Save,
    Load,
    Invalid(String),
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[derive(bevy::ecs::system::SystemParam)]
struct BagWriters<'w> {
    command: EventWriter<'w, BagCommand>,
    list:    EventWriter<'w, ListInventoryEvent>,
    click:   EventWriter<'w, ClickSlotEvent>,
}

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    bag: Res<ItemBag>,
    mut bag_writers: BagWriters,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}, Slots: {}/{} ({} free)",
                    state.get(),
                    catalog.len(),
                    bag.len(),
                    bag.capacity(),
                    bag.free_slots()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Items(None) => {
                for entry in catalog.iter() {
                    log.write(LogEvent(format!(
                        "{} | {} | {}",
                        entry.uuid(),
                        entry.id,
                        entry.name
                    )));
                }
            }

            Command::Items(Some(token)) => match catalog.find(&token) {
                Some(e) => {
                    log.write(LogEvent(format!(
                        "==================================================
UUID : {}
ID   : {}
Name : {}
Icon : {}
Desc : {}
==================================================",
                        e.uuid(),
                        e.id,
                        e.name,
                        e.icon,
                        e.description
                    )));
                }
                None => {
                    log.write(LogEvent("未找到匹配物品".into()));
                }
            },

            Command::Give { id, count } => {
                bag_writers.command.write(BagCommand::Give { id, count });
            }

            Command::Take { id, count } => {
                bag_writers.command.write(BagCommand::Take { id, count });
            }

            Command::Count(id) => {
                bag_writers.command.write(BagCommand::Count { id });
            }

            Command::Inventory => {
                bag_writers.list.write(ListInventoryEvent);
            }

            Command::Click(index) => {
                bag_writers.click.write(ClickSlotEvent { index });
            }

            Command::Save => {
                bag_writers.command.write(BagCommand::Save);
            }

            Command::Load => {
                bag_writers.command.write(BagCommand::Load);
            }

            Command::Invalid(msg) => {
                log.write(LogEvent(msg));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => {
            let token = parts.next().map(|s| s.to_string());
            Command::Items(token)
        }
        "give" | "take" => {
            let Some(id) = parts.next().and_then(|s| s.parse().ok()) else {
                return Command::Invalid(format!("用法: {cmd} <id> [count]"));
            };
            let Ok(count) = parts.next().unwrap_or("1").parse() else {
                return Command::Invalid(format!("用法: {cmd} <id> [count]"));
            };
            if cmd == "give" {
                Command::Give { id, count }
            } else {
                Command::Take { id, count }
            }
        }
        "count" | "c" => match parts.next().and_then(|s| s.parse().ok()) {
            Some(id) => Command::Count(id),
            None => Command::Invalid("用法: count <id>".into()),
        },
        "inventory" | "inv" => Command::Inventory,
        "click" => match parts.next().and_then(|s| s.parse().ok()) {
            Some(index) => Command::Click(index),
            None => Command::Invalid("用法: click <slot>".into()),
        },
        "save" => Command::Save,
        "load" => Command::Load,
        other => Command::Unsupported(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bag_commands() {
        assert_eq!(parse_command("give 3 10"), Command::Give { id: 3, count: 10 });
        assert_eq!(parse_command("GIVE 3"), Command::Give { id: 3, count: 1 });
        assert_eq!(parse_command("take 2 5"), Command::Take { id: 2, count: 5 });
        assert_eq!(parse_command("count 4"), Command::Count(4));
        assert_eq!(parse_command("inv"), Command::Inventory);
        assert_eq!(parse_command("click 0"), Command::Click(0));
        assert_eq!(parse_command("save"), Command::Save);
        assert_eq!(parse_command("load"), Command::Load);
    }

    #[test]
    fn parses_general_commands() {
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("s"), Command::Status);
        assert_eq!(parse_command("quit"), Command::Exit);
        assert_eq!(parse_command("items"), Command::Items(None));
        assert_eq!(
            parse_command("items Apple"),
            Command::Items(Some("Apple".into()))
        );
        assert_eq!(parse_command("dance"), Command::Unsupported("dance".into()));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(matches!(parse_command("give"), Command::Invalid(_)));
        assert!(matches!(parse_command("give apple"), Command::Invalid(_)));
        assert!(matches!(parse_command("take 1 -2"), Command::Invalid(_)));
        assert!(matches!(parse_command("count"), Command::Invalid(_)));
        assert!(matches!(parse_command("click x"), Command::Invalid(_)));
    }

    #[test]
    fn typed_commands_reach_the_bag_in_the_same_frame() {
        use crate::inventory::tests::test_app;
        use std::path::PathBuf;

        let mut app = test_app(2, PathBuf::from("unused.json"));
        add_cli_systems(&mut app);

        app.world_mut().send_event(CliLine("take 1".into()));
        app.world_mut().send_event(CliLine("give 1 2".into()));
        app.update();

        let bag = app.world().resource::<ItemBag>();
        assert_eq!(bag.quantity_of(1), 2);
    }
}
