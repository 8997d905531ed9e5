use num_enum::{IntoPrimitive, TryFromPrimitive};

// Packet framing: [length:u24-le][sequence:u8][command:u8][payload]
pub const HEADER_LEN: usize = 4;
pub const COMMAND_OFFSET: usize = 4;
pub const MIN_FRAME_LEN: usize = HEADER_LEN + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MysqlCommand {
    Sleep = 0,
    Quit = 1,
    InitDb = 2,
    Query = 3,
    FieldList = 4,
    CreateDb = 5,
    DropDb = 6,
    Refresh = 7,
    Shutdown = 8,
    Statistics = 9,
    ProcessInfo = 10,
    Connect = 11,
    ProcessKill = 12,
    Debug = 13,
    Ping = 14,
    Time = 15,
    DelayedInsert = 16,
    ChangeUser = 17,
    BinlogDump = 18,
    TableDump = 19,
    ConnectOut = 20,
    RegisterSlave = 21,
    StmtPrepare = 22,
    StmtExecute = 23,
    StmtSendLongData = 24,
    StmtClose = 25,
    StmtReset = 26,
    SetOption = 27,
    StmtFetch = 28,
    Daemon = 29,
    BinlogDumpGtid = 30,
    ResetConnection = 31,
}

impl PartialEq<u8> for MysqlCommand {
    fn eq(&self, other: &u8) -> bool {
        u8::from(*self).eq(other)
    }
}

impl PartialEq<MysqlCommand> for u8 {
    fn eq(&self, other: &MysqlCommand) -> bool {
        u8::from(*other).eq(self)
    }
}

impl MysqlCommand {
    pub fn name(command: u8) -> &'static str {
        match MysqlCommand::try_from(command) {
            Ok(MysqlCommand::Sleep) => "COM_SLEEP",
            Ok(MysqlCommand::Quit) => "COM_QUIT",
            Ok(MysqlCommand::InitDb) => "COM_INIT_DB",
            Ok(MysqlCommand::Query) => "COM_QUERY",
            Ok(MysqlCommand::FieldList) => "COM_FIELD_LIST",
            Ok(MysqlCommand::CreateDb) => "COM_CREATE_DB",
            Ok(MysqlCommand::DropDb) => "COM_DROP_DB",
            Ok(MysqlCommand::Refresh) => "COM_REFRESH",
            Ok(MysqlCommand::Shutdown) => "COM_SHUTDOWN",
            Ok(MysqlCommand::Statistics) => "COM_STATISTICS",
            Ok(MysqlCommand::ProcessInfo) => "COM_PROCESS_INFO",
            Ok(MysqlCommand::Connect) => "COM_CONNECT",
            Ok(MysqlCommand::ProcessKill) => "COM_PROCESS_KILL",
            Ok(MysqlCommand::Debug) => "COM_DEBUG",
            Ok(MysqlCommand::Ping) => "COM_PING",
            Ok(MysqlCommand::Time) => "COM_TIME",
            Ok(MysqlCommand::DelayedInsert) => "COM_DELAYED_INSERT",
            Ok(MysqlCommand::ChangeUser) => "COM_CHANGE_USER",
            Ok(MysqlCommand::BinlogDump) => "COM_BINLOG_DUMP",
            Ok(MysqlCommand::TableDump) => "COM_TABLE_DUMP",
            Ok(MysqlCommand::ConnectOut) => "COM_CONNECT_OUT",
            Ok(MysqlCommand::RegisterSlave) => "COM_REGISTER_SLAVE",
            Ok(MysqlCommand::StmtPrepare) => "COM_STMT_PREPARE",
            Ok(MysqlCommand::StmtExecute) => "COM_STMT_EXECUTE",
            Ok(MysqlCommand::StmtSendLongData) => "COM_STMT_SEND_LONG_DATA",
            Ok(MysqlCommand::StmtClose) => "COM_STMT_CLOSE",
            Ok(MysqlCommand::StmtReset) => "COM_STMT_RESET",
            Ok(MysqlCommand::SetOption) => "COM_SET_OPTION",
            Ok(MysqlCommand::StmtFetch) => "COM_STMT_FETCH",
            Ok(MysqlCommand::Daemon) => "COM_DAEMON",
            Ok(MysqlCommand::BinlogDumpGtid) => "COM_BINLOG_DUMP_GTID",
            Ok(MysqlCommand::ResetConnection) => "COM_RESET_CONNECTION",
            Err(_) => "",
        }
    }
}
