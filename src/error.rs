use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomBenchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`room-bench config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("データセット読み込みエラー: {0}")]
    DatasetLoad(String),

    #[error("評価対象レコードがありません: {0}")]
    NoRecordsFound(String),

    #[error("分類器呼び出しエラー: {0}")]
    BackendCall(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RoomBenchError>;
