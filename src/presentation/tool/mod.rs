mod transcribe_tool;

pub use transcribe_tool::{
    tool_schema, ErrorType, ResponseMetadata, ToolInput, ToolInputError, ToolResponse,
    TranscribeTool, TOOL_DESCRIPTION, TOOL_NAME,
};
